mod valuation_tests;
